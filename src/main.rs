//! chime-hook: plays a bundled chime when a notification hook fires.
//!
//! Takes no arguments and reads no input. Writes one status line to stderr and
//! always exits successfully, whether or not the chime could be played.

use log::debug;

use chime_hook::hook;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let outcome = hook::run();
    debug!("Hook finished: {outcome:?}");
}
