pub mod config;
pub mod heap;
pub mod path;
pub mod scenario;
pub mod sim;
pub mod world;

#[cfg(test)]
mod test;
