//! Chain of definitions currently being expanded.
//!
//! Each recursion level borrows its parent's trail and pushes one name on a
//! stack-allocated node, so detection needs no shared mutable state.

use crate::error::ModelError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Trail<'t> {
    name: &'t str,
    parent: Option<&'t Trail<'t>>,
}

impl<'t> Trail<'t> {
    /// Enters `name`, failing if it is already on the trail.
    pub(crate) fn enter(parent: Option<&'t Trail<'t>>, name: &'t str) -> Result<Self, ModelError> {
        if let Some(parent) = parent {
            if parent.contains(name) {
                return Err(ModelError::CyclicReference(parent.render_cycle(name)));
            }
        }
        Ok(Self { name, parent })
    }

    fn contains(&self, name: &str) -> bool {
        self.name == name || self.parent.is_some_and(|p| p.contains(name))
    }

    fn render_cycle(&self, closing: &str) -> String {
        let mut names = vec![closing];
        let mut node = Some(self);
        while let Some(current) = node {
            names.push(current.name);
            node = current.parent;
        }
        names.reverse();
        names.join(" -> ")
    }
}
