pub mod credential_context;
