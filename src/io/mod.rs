pub mod floatmap;
pub mod json_writer;
pub mod raster;
pub mod summary;
