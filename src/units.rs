#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

/// Number of corridors forced open across one shared tile edge.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct SeamOpenings(pub usize);

/// Linear identifier of a cell in a bounded grid, `y * width + x`.
pub type CellId = usize;
