// Listing pipeline: raw records -> normalize -> filter -> sort -> paginate

pub mod processing;
