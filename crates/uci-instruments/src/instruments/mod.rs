pub mod apache2;
pub mod kinesio;
pub mod mbi;
pub mod nas;
