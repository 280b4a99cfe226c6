/// Navigation Control Center document; its presence marks a DAISY 2.02 book.
pub const MARKER_FILE: &str = "ncc.html";

pub const TAG_TITLE: &str = "dc:title";
pub const TAG_CREATOR: &str = "dc:creator";

/// Author shown when the book does not name one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";
