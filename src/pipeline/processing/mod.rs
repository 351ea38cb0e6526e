// Pipeline processing: record normalization and list-view transformation

pub mod assemble;
pub mod filter;
pub mod normalize;
pub mod paginate;
pub mod sort;
