pub mod delete_file;
pub mod describe_file;
pub mod upload_files;
