pub use anyhow::{
    anyhow,
    bail,
    ensure,
};
pub use paste::paste;
pub use thiserror::Error;

pub type EmptyResult = anyhow::Result<()>;

// Stack frames from these locations are toolchain/runtime noise and get collapsed by ocverr!
pub const BUILD_DIR: &str = "/.build/";
pub const RUSTC_DIR: &str = "/rustc/";
pub const CARGO_REGISTRY_DIR: &str = "/.cargo/registry/";

// This macro creates an enum which derives from thiserror::Error, and also
// creates constructor functions in snake case for each of the enum variants
#[macro_export]
macro_rules! err_impl {
    (@hidden $errtype:ident, $item:ident, String) => {
        $crate::errors::paste! {
            pub fn [<$item:snake>](in_: &str) -> anyhow::Error {
                anyhow::anyhow!{$errtype::$item(in_.into())}
            }
        }
    };

    (@hidden $errtype:ident, $item:ident, $($dtype:tt)::+) => {
        $crate::errors::paste! {
            pub fn [<$item:snake>](in_: &$($dtype)::+) -> anyhow::Error {
                anyhow::anyhow!{$errtype::$item(in_.clone())}
            }
        }
    };

    ($errtype:ident,
        $(#[$errinfo:meta] $item:ident($($dtype:tt)::+),)+
    ) => {
        #[derive(Debug, $crate::errors::Error)]
        pub enum $errtype {
            $(#[$errinfo] $item($($dtype)::+)),+
        }

        impl $errtype {
            $($crate::err_impl! {@hidden $errtype, $item, $($dtype)::+})+
        }
    };
}

// Log an error that we're about to swallow, along with the part of its backtrace that points at
// our own code.  Backtraces are only populated when RUST_BACKTRACE/RUST_LIB_BACKTRACE is set, so
// in the common case this is just an error! line.
#[macro_export]
macro_rules! ocverr {
    ($err:expr, $msg:literal $(, $args:expr)* $(,)?) => {{
        let err: &anyhow::Error = &$err;
        let trace = $crate::errors::trimmed_backtrace(&err.backtrace().to_string());
        if trace.is_empty() {
            tracing::error!(concat!($msg, ": {:#}") $(, $args)*, err);
        } else {
            tracing::error!(concat!($msg, ": {:#}\n\nPartial Stack Trace:\n\n{}\n") $(, $args)*, err, trace);
        }
    }};
}

pub fn trimmed_backtrace(bt: &str) -> String {
    lazy_static::lazy_static! {
        static ref FRAME_RE: regex::Regex = regex::RegexBuilder::new(r"^\s+\d+(?s:.*?)(\s+at\s+.*:\d+)$")
            .multi_line(true)
            .build()
            .expect("frame regex is valid");
    }

    let mut skipped_frames = 0;
    let mut out = String::new();
    for frame in FRAME_RE.find_iter(bt).map(|m| m.as_str()) {
        if frame.contains(BUILD_DIR) || frame.contains(RUSTC_DIR) || frame.contains(CARGO_REGISTRY_DIR) {
            skipped_frames += 1;
            continue;
        }
        push_skipped(&mut out, skipped_frames);
        out.push_str(frame);
        out.push('\n');
        skipped_frames = 0;
    }

    // Don't bother reporting a tail of skipped frames if nothing was kept
    if !out.is_empty() {
        push_skipped(&mut out, skipped_frames);
    }
    out
}

fn push_skipped(out: &mut String, n: usize) {
    match n {
        0 => (),
        1 => out.push_str("      -- <skipped 1 frame> --\n"),
        n => out.push_str(&format!("      -- <skipped {n} frames> --\n")),
    }
}

pub use {
    err_impl,
    ocverr,
};
