pub mod gotify;
