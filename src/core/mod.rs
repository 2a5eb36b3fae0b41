// ─── mclauncher core ───
// Backend for a modpack-syncing Minecraft launcher.
//
// Architecture:
//   core/
//     error    — central error enum
//     http     — shared HTTP client
//     fetch/   — JSON fetch + streamed file downloads with mirror fallback
//     options/ — options.txt key/value store, reconciler, stock baselines
//     settings/— per-profile clamped settings + persistence
//     sync/    — manifest model, sync engine, prune pass
//     state/   — launcher context wiring the above together

pub mod error;
pub mod fetch;
pub mod http;
pub mod options;
pub mod settings;
pub mod state;
pub mod sync;
