//! Groups: named sets of panel references, nested like the panel tree.

/// Width of a group name and of each panel reference in a `grp1` record.
pub const GROUP_NAME_SIZE: usize = 0x10;

/// A named selection of panels.
///
/// Groups reference panels by name only; they do not own them. Use
/// [`crate::Layout::group_panels`] to resolve the references against the panel tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    /// Name, at most [`GROUP_NAME_SIZE`] UTF-8 bytes
    pub name: String,
    /// Names of the member panels, each at most [`GROUP_NAME_SIZE`] UTF-8 bytes
    pub panels: Vec<String>,
    /// Nested groups in declaration order
    pub children: Vec<Group>,
}

impl Group {
    /// Create an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Group {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Iterate over this group and its descendants in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let group = stack.pop()?;
            stack.extend(group.children.iter().rev());
            Some(group)
        })
    }
}
