/*!
 * Matrix Reader
 * Reads a jagged character grid from text and releases it explicitly
 */

mod grid;
mod reader;

pub use grid::CharMatrix;
pub use reader::read_matrix;
