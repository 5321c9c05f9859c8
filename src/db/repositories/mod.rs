mod accounts;
mod observations;
mod profiles;
