use crate::vertex::VertexArray;

/// A registered observer of a [`GeometryArray`]'s updates. Invoked with the
/// array's current contents and the vertex-index range that changed.
/// Typically a closure that forwards the change into a buffer segment.
pub type ArrayUser = Box<dyn FnMut(&VertexArray, Option<(u32, u32)>) + Send>;

/// A [`VertexArray`] plus interleave links and the users that react to its
/// updates.
///
/// Arrays can be chained into an interleave group through `root`/`child`
/// indices (positions into the owning [`super::Geometry`]'s array list): the
/// chain's root describes the stride shared by every array in it.
pub struct GeometryArray {
    array: VertexArray,
    root: Option<usize>,
    child: Option<usize>,
    users: Vec<ArrayUser>,
    modified_range: Option<(u32, u32)>,
}

impl GeometryArray {
    pub fn new(array: VertexArray) -> Self {
        GeometryArray { array, root: None, child: None, users: Vec::new(), modified_range: None }
    }

    pub fn array(&self) -> &VertexArray {
        &self.array
    }

    pub fn array_mut(&mut self) -> &mut VertexArray {
        &mut self.array
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn child(&self) -> Option<usize> {
        self.child
    }

    pub(crate) fn set_root(&mut self, root: Option<usize>) {
        self.root = root;
    }

    pub(crate) fn set_child(&mut self, child: Option<usize>) {
        self.child = child;
    }

    pub fn add_user(&mut self, user: ArrayUser) {
        self.users.push(user);
    }

    pub fn is_modified(&self) -> bool {
        self.modified_range.is_some()
    }

    pub fn modified_range(&self) -> Option<(u32, u32)> {
        self.modified_range
    }

    pub(crate) fn mark_modified(&mut self, range: Option<(u32, u32)>) {
        self.modified_range = Some(match range {
            Some((lo, hi)) => match self.modified_range {
                Some((olo, ohi)) => (olo.min(lo), ohi.max(hi)),
                None => (lo, hi),
            },
            None => (0, u32::MAX),
        });
    }

    /// Invokes every registered user with the current array and modified
    /// range, then clears the range — the array is "returned to the
    /// normal list".
    pub(crate) fn update(&mut self) {
        let range = self.modified_range;
        for user in &mut self.users {
            user(&self.array, range);
        }
        self.modified_range = None;
    }
}

#[cfg(test)]
#[path = "array_tests.rs"]
mod tests;
