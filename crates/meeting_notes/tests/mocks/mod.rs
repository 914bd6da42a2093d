pub mod language_model;
