pub mod appsettings;
pub mod notification;
pub mod platform;
pub mod reminder;
pub mod scheduling;
pub mod service;
pub mod storage;

#[cfg(test)]
mod test_utils;
