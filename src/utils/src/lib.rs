pub mod ext;
