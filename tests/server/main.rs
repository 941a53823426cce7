mod accounts_api;
mod client_api;
mod helpers;
mod library_api;
mod pictures_api;
