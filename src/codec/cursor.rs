//! Rebuilding a tree from a flat stream of nodes and start/end markers.
//!
//! The cursor is either closed, or open at some node of the tree under construction. Nodes are
//! appended as the last child of the open node, or become the root while the cursor is closed.
//! A start marker moves the cursor down into the most recently appended child (or onto the root
//! if the cursor is closed), an end marker moves it back up, leaving the root closes it.
//!
//! The open position is stored as a path of child indices from the root, so the tree itself never
//! needs parent references.

use crate::Result;

/// A node that owns an ordered list of children of its own type.
pub trait TreeNode: Sized {
    /// The node's name, used in error messages.
    fn name(&self) -> &str;

    /// The ordered children.
    fn children(&self) -> &[Self];

    /// The ordered children, mutably.
    fn children_mut(&mut self) -> &mut Vec<Self>;
}

impl TreeNode for crate::layout::Panel {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

impl TreeNode for crate::layout::Group {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

/// Incremental tree builder driven by node and marker sections.
#[derive(Debug)]
pub struct TreeCursor<T> {
    root: Option<T>,
    open: Option<Vec<usize>>,
    kind: &'static str,
}

impl<T: TreeNode> TreeCursor<T> {
    /// Create an empty, closed cursor. `kind` names the tree in error messages.
    pub fn new(kind: &'static str) -> Self {
        TreeCursor {
            root: None,
            open: None,
            kind,
        }
    }

    /// Number of open start markers.
    pub fn depth(&self) -> usize {
        self.open.as_ref().map_or(0, |path| path.len() + 1)
    }

    /// True if every start marker seen so far has been closed.
    pub fn is_balanced(&self) -> bool {
        self.open.is_none()
    }

    /// Append `node` at the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::Structural`] if the cursor is closed and a root already exists.
    pub fn append(&mut self, node: T, offset: usize) -> Result<()> {
        match &self.open {
            None => {
                if let Some(root) = &self.root {
                    return Err(structural_error!(
                        "Second {} root '{}' at offset {:#x}, tree already rooted at '{}'",
                        self.kind,
                        node.name(),
                        offset,
                        root.name()
                    ));
                }
                self.root = Some(node);
            }
            Some(_) => self.open_node_mut(offset)?.children_mut().push(node),
        }

        Ok(())
    }

    /// Handle a start marker.
    ///
    /// # Errors
    /// Returns [`crate::Error::Structural`] if there is no node to descend into, or if that node
    /// already had its children opened once.
    pub fn start(&mut self, offset: usize) -> Result<()> {
        let path = match self.open.clone() {
            None => {
                if self.root.is_none() {
                    return Err(structural_error!(
                        "{} start marker at offset {:#x} before any {}",
                        self.kind,
                        offset,
                        self.kind
                    ));
                }
                Vec::new()
            }
            Some(mut path) => {
                let children = self.open_node_mut(offset)?.children().len();
                if children == 0 {
                    return Err(structural_error!(
                        "{} start marker at offset {:#x} has no preceding {} to descend into",
                        self.kind,
                        offset,
                        self.kind
                    ));
                }
                path.push(children - 1);
                path
            }
        };

        let previous = self.open.replace(path);
        let target = self.open_node_mut(offset)?;
        if !target.children().is_empty() {
            let name = target.name().to_string();
            self.open = previous;
            return Err(structural_error!(
                "Second {} start marker for '{}' at offset {:#x}",
                self.kind,
                name,
                offset
            ));
        }

        Ok(())
    }

    /// Handle an end marker.
    ///
    /// # Errors
    /// Returns [`crate::Error::Structural`] if the cursor is already closed, or if the child list
    /// being closed is empty.
    pub fn end(&mut self, offset: usize) -> Result<()> {
        if self.open.is_none() {
            return Err(structural_error!(
                "{} end marker at offset {:#x} without a matching start",
                self.kind,
                offset
            ));
        }

        let kind = self.kind;
        let node = self.open_node_mut(offset)?;
        if node.children().is_empty() {
            return Err(structural_error!(
                "Empty {} child list of '{}' closed at offset {:#x}",
                kind,
                node.name(),
                offset
            ));
        }

        let closes_root = self.open.as_mut().is_some_and(|path| path.pop().is_none());
        if closes_root {
            self.open = None;
        }

        Ok(())
    }

    /// The node a trailing record (such as user data) applies to: the last child of the open
    /// node, or the root while the cursor is closed.
    ///
    /// # Errors
    /// Returns [`crate::Error::Structural`] if there is no such node.
    pub fn last_appended_mut(&mut self, offset: usize) -> Result<&mut T> {
        let kind = self.kind;
        if self.open.is_none() {
            return self.root.as_mut().ok_or_else(|| {
                structural_error!("Record at offset {:#x} precedes any {}", offset, kind)
            });
        }

        self.open_node_mut(offset)?
            .children_mut()
            .last_mut()
            .ok_or_else(|| {
                structural_error!(
                    "Record at offset {:#x} follows a {} start marker with no {} after it",
                    offset,
                    kind,
                    kind
                )
            })
    }

    /// Consume the cursor and return the finished tree.
    ///
    /// # Errors
    /// Returns [`crate::Error::Structural`] if start markers are left open.
    pub fn finish(self) -> Result<Option<T>> {
        if !self.is_balanced() {
            return Err(structural_error!(
                "{} start marker left open, {} level(s) unclosed at end of stream",
                self.kind,
                self.depth()
            ));
        }

        Ok(self.root)
    }

    fn open_node_mut(&mut self, offset: usize) -> Result<&mut T> {
        let kind = self.kind;
        let broken = || structural_error!("Broken {} cursor at offset {:#x}", kind, offset);

        let path = self.open.as_ref().ok_or_else(broken)?;
        let mut node = self.root.as_mut().ok_or_else(broken)?;
        for &index in path {
            node = node.children_mut().get_mut(index).ok_or_else(broken)?;
        }

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layout::Group, Error};

    fn names(group: &Group) -> Vec<&str> {
        group.iter().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn builds_nested_tree() {
        // root { a { a1 } b }
        let mut cursor = TreeCursor::new("group");
        cursor.append(Group::new("root"), 0).unwrap();
        cursor.start(1).unwrap();
        cursor.append(Group::new("a"), 2).unwrap();
        cursor.start(3).unwrap();
        assert_eq!(cursor.depth(), 2);
        cursor.append(Group::new("a1"), 4).unwrap();
        cursor.end(5).unwrap();
        cursor.append(Group::new("b"), 6).unwrap();
        cursor.end(7).unwrap();
        assert!(cursor.is_balanced());

        let root = cursor.finish().unwrap().unwrap();
        assert_eq!(names(&root), ["root", "a", "a1", "b"]);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].children[0].name, "a1");
    }

    #[test]
    fn trailing_record_targets_last_sibling() {
        let mut cursor = TreeCursor::new("group");
        cursor.append(Group::new("root"), 0).unwrap();
        assert_eq!(cursor.last_appended_mut(0).unwrap().name, "root");

        cursor.start(1).unwrap();
        assert!(cursor.last_appended_mut(1).is_err());
        cursor.append(Group::new("a"), 2).unwrap();
        cursor.append(Group::new("b"), 3).unwrap();
        assert_eq!(cursor.last_appended_mut(4).unwrap().name, "b");
    }

    #[test]
    fn end_without_start() {
        let mut cursor: TreeCursor<Group> = TreeCursor::new("group");
        assert!(matches!(cursor.end(0x40), Err(Error::Structural { .. })));

        cursor.append(Group::new("root"), 0).unwrap();
        cursor.start(1).unwrap();
        cursor.append(Group::new("a"), 2).unwrap();
        cursor.end(3).unwrap();
        assert!(matches!(cursor.end(4), Err(Error::Structural { .. })));
    }

    #[test]
    fn empty_child_list() {
        let mut cursor = TreeCursor::new("group");
        cursor.append(Group::new("root"), 0).unwrap();
        cursor.start(1).unwrap();
        match cursor.end(2) {
            Err(Error::Structural { message, .. }) => assert!(message.contains("root")),
            other => panic!("expected structural error, got {other:?}"),
        }
    }

    #[test]
    fn children_open_only_once() {
        // root { a } { b }
        let mut cursor = TreeCursor::new("group");
        cursor.append(Group::new("root"), 0).unwrap();
        cursor.start(1).unwrap();
        cursor.append(Group::new("a"), 2).unwrap();
        cursor.end(3).unwrap();
        assert!(matches!(cursor.start(4), Err(Error::Structural { .. })));

        // root { a { a1 } { a2 } }
        let mut cursor = TreeCursor::new("group");
        cursor.append(Group::new("root"), 0).unwrap();
        cursor.start(1).unwrap();
        cursor.append(Group::new("a"), 2).unwrap();
        cursor.start(3).unwrap();
        cursor.append(Group::new("a1"), 4).unwrap();
        cursor.end(5).unwrap();
        assert!(matches!(cursor.start(6), Err(Error::Structural { .. })));
        assert_eq!(cursor.depth(), 1);
    }

    #[test]
    fn start_without_node() {
        let mut cursor: TreeCursor<Group> = TreeCursor::new("group");
        assert!(matches!(cursor.start(0), Err(Error::Structural { .. })));

        cursor.append(Group::new("root"), 0).unwrap();
        cursor.start(1).unwrap();
        assert!(matches!(cursor.start(2), Err(Error::Structural { .. })));
    }

    #[test]
    fn unclosed_start() {
        let mut cursor = TreeCursor::new("group");
        cursor.append(Group::new("root"), 0).unwrap();
        cursor.start(1).unwrap();
        assert!(matches!(cursor.finish(), Err(Error::Structural { .. })));
    }

    #[test]
    fn second_root() {
        let mut cursor = TreeCursor::new("group");
        cursor.append(Group::new("root"), 0).unwrap();
        match cursor.append(Group::new("other"), 0x20) {
            Err(Error::Structural { message, .. }) => {
                assert!(message.contains("other"));
                assert!(message.contains("0x20"));
            }
            other => panic!("expected structural error, got {other:?}"),
        }
    }

    #[test]
    fn empty_stream() {
        let cursor: TreeCursor<Group> = TreeCursor::new("group");
        assert!(cursor.finish().unwrap().is_none());
    }
}
