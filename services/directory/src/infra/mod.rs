pub mod blob;
pub mod db;
