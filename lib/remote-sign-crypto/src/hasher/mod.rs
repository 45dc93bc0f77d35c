pub mod sha;
