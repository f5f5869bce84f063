mod guid;

pub use guid::Guid;
