mod admin_test;
mod contact_test;
mod helpers;
