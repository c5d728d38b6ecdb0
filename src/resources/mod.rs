pub mod bucket;
pub mod object;
pub mod s3;
