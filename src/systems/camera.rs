use bevy_ecs::prelude::*;

use crate::components::identity::Identity;
use crate::components::mapposition::MapPosition;
use crate::resources::camera2d::Camera2D;
use crate::resources::registry::EntityRegistry;

/// Move the camera one smoothing step toward its target.
///
/// A missing, destroyed or compacted target leaves the camera where it is.
pub fn camera_follow(
    mut camera: ResMut<Camera2D>,
    registry: Res<EntityRegistry>,
    query: Query<(&Identity, &MapPosition)>,
) {
    let Some(target) = camera.target else {
        return;
    };
    let Some(entity) = registry.lookup(target) else {
        return;
    };
    if let Ok((identity, position)) = query.get(entity)
        && identity.active
    {
        camera.smooth_toward(position.pos);
    }
}
