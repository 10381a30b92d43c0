pub mod catalog;
pub mod m3u_writer;
pub mod xtream;
