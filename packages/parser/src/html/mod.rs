//! HTML cleaning, serialization and navigation utilities.

mod normalize;
mod serialize;
mod utils;

pub use normalize::{normalize, NormalizedDocument};
pub use serialize::{inner_html, outer_html, unify_punctuation};
pub use utils::{
    element_children, find_children, get_tag_name, get_text, normalize_whitespace, row_cells,
    spaced_text, table_rows, text_lines,
};
