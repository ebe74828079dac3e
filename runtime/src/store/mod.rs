//! Hosted article storage.

pub mod supabase;

pub use supabase::SupabaseStore;
