use glam::Vec2;
use orrery_engine::{Camera3D, EntityId, RayCaster};

/// What a pick can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickId {
    Star,
    /// Registry index of a body.
    Body(usize),
}

impl PickId {
    /// Wire index sent to the UI: 0 = star, 1.. = bodies in table order.
    pub fn wire_index(self) -> f32 {
        match self {
            PickId::Star => 0.0,
            PickId::Body(i) => (i + 1) as f32,
        }
    }
}

/// Wire index for an optional pick, -1 meaning nothing.
pub fn wire_index(pick: Option<PickId>) -> f32 {
    pick.map(PickId::wire_index).unwrap_or(-1.0)
}

/// A scene node eligible for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickable {
    pub id: PickId,
    pub node: EntityId,
}

/// Cast a ray from the camera through `ndc` and return the nearest pickable hit.
///
/// Hits at equal distance resolve to whichever pickable comes first in `pickables`.
pub fn pick(ndc: Vec2, camera: &Camera3D, pickables: &[Pickable], caster: &impl RayCaster) -> Option<Pickable> {
    if pickables.is_empty() {
        return None;
    }
    let ray = camera.ray_from_ndc(ndc);
    let nodes: Vec<EntityId> = pickables.iter().map(|p| p.node).collect();

    caster
        .intersect(&ray, &nodes)
        .into_iter()
        .filter_map(|hit| {
            let order = pickables.iter().position(|p| p.node == hit.id)?;
            Some((hit.distance, order))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, order)| pickables[order])
}

/// Hover and click results feeding the cursor and the info panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    hovered: Option<PickId>,
    selected: Option<PickId>,
}

impl Selection {
    pub fn hovered(&self) -> Option<PickId> {
        self.hovered
    }

    pub fn selected(&self) -> Option<PickId> {
        self.selected
    }

    /// Record a hover pick. A miss clears both hover and selection.
    /// Returns true if the selection changed.
    pub fn hover(&mut self, hit: Option<PickId>) -> bool {
        self.hovered = hit;
        if hit.is_none() {
            return self.selected.take().is_some();
        }
        false
    }

    /// Record a click pick. A hit selects; a miss clears both.
    /// Returns true if the selection changed.
    pub fn click(&mut self, hit: Option<PickId>) -> bool {
        self.hovered = hit;
        let changed = self.selected != hit;
        self.selected = hit;
        changed
    }
}
