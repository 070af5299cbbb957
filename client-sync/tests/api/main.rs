mod auth;
mod collections;
mod preferences;
mod recalls;
mod scan;
mod transparency;
mod wrapper;
