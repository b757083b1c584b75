use std::collections::HashMap;

use crate::{Body, BodyId, SystemError, Vector3};

/// The parent and satellites of a body in a [`System`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyRelation {
    /// The body this one orbits, or `None` for the root.
    pub parent: Option<BodyId>,
    /// Bodies orbiting this one.
    pub satellites: Vec<BodyId>,
}

#[derive(Clone, Debug, PartialEq)]
struct BodyWrapper {
    body: Body,
    relations: BodyRelation,
}

/// A tree of gravitating bodies with a single root.
///
/// The root is the dominant gravity source for flight path prediction.
/// Satellites carry their orbit around their parent, which lets the system
/// answer absolute-position and sphere-of-influence queries.
#[derive(Clone, Debug, PartialEq)]
pub struct System {
    bodies: HashMap<BodyId, BodyWrapper>,
    root: BodyId,
}

impl System {
    /// Creates a system containing only its root body.
    pub fn new(root: Body) -> Self {
        let root_id = root.id();
        let mut bodies = HashMap::new();
        bodies.insert(
            root_id,
            BodyWrapper {
                body: root,
                relations: BodyRelation {
                    parent: None,
                    satellites: Vec::new(),
                },
            },
        );

        Self {
            bodies,
            root: root_id,
        }
    }

    /// Adds a satellite to the system.
    ///
    /// `body`: The body to add. Its orbit, if any, is taken to be around `satellite_of`.
    /// `satellite_of`: The id of the body that this body is orbiting.
    /// Returns: The id of the newly-added body.
    pub fn add_body(&mut self, body: Body, satellite_of: BodyId) -> Result<BodyId, SystemError> {
        let id = body.id();
        if self.bodies.contains_key(&id) {
            return Err(SystemError::DuplicateBody(id));
        }

        let parent = self
            .bodies
            .get_mut(&satellite_of)
            .ok_or(SystemError::ParentNotFound(satellite_of))?;
        parent.relations.satellites.push(id);

        self.bodies.insert(
            id,
            BodyWrapper {
                body,
                relations: BodyRelation {
                    parent: Some(satellite_of),
                    satellites: Vec::new(),
                },
            },
        );

        Ok(id)
    }

    /// The root body.
    pub fn root(&self) -> &Body {
        // The root is inserted on construction and never removed
        &self.bodies[&self.root].body
    }

    /// The id of the root body.
    #[inline]
    pub fn root_id(&self) -> BodyId {
        self.root
    }

    /// Gets a body by id.
    pub fn get_body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id).map(|wrapper| &wrapper.body)
    }

    /// Gets the parent of a body, or `None` for the root or unknown ids.
    pub fn get_parent(&self, id: BodyId) -> Option<&Body> {
        let parent = self.bodies.get(&id)?.relations.parent?;
        self.get_body(parent)
    }

    /// The ids of the bodies directly orbiting `id`.
    pub fn get_satellites(&self, id: BodyId) -> &[BodyId] {
        self.bodies
            .get(&id)
            .map(|wrapper| wrapper.relations.satellites.as_slice())
            .unwrap_or(&[])
    }

    /// Gets the parent and satellites of a body.
    pub fn get_relations(&self, id: BodyId) -> Option<&BodyRelation> {
        self.bodies.get(&id).map(|wrapper| &wrapper.relations)
    }

    /// Number of bodies in the system, including the root.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Always false; a system holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterates over all bodies in no particular order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values().map(|wrapper| &wrapper.body)
    }

    /// Gets the absolute position of a body at time `t`.
    ///
    /// The root sits at the origin. Each satellite's orbit is advanced by
    /// `t` seconds from its epoch and added to its parent's position.
    pub fn get_body_position(&self, id: BodyId, t: f64) -> Option<Vector3> {
        let wrapper = self.bodies.get(&id)?;

        let mut position = match &wrapper.body.orbit {
            Some(orbit) => orbit.predict(t).position(),
            None => Vector3::ZERO,
        };

        if let Some(parent) = wrapper.relations.parent {
            position += self.get_body_position(parent, t)?;
        }

        Some(position)
    }

    /// Finds the body whose gravity dominates at an absolute position.
    ///
    /// Descends from the root into any satellite whose sphere of influence
    /// contains `position` at time `t`. Falls back to the root.
    pub fn find_primary(&self, position: Vector3, t: f64) -> &Body {
        let mut current = self.root;

        'descend: loop {
            let Some(wrapper) = self.bodies.get(&current) else {
                break;
            };
            let parent_mu = wrapper.body.gravitational_parameter();

            for &satellite in &wrapper.relations.satellites {
                let Some(child) = self.bodies.get(&satellite) else {
                    continue;
                };
                let (Some(soi), Some(child_position)) = (
                    child.body.sphere_of_influence(parent_mu),
                    self.get_body_position(satellite, t),
                ) else {
                    continue;
                };

                if position.distance(child_position) < soi {
                    current = satellite;
                    continue 'descend;
                }
            }

            break;
        }

        self.get_body(current).unwrap_or_else(|| self.root())
    }
}
