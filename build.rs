use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Askama reads templates at compile time; a directory hint is enough to
    // rebuild when any of them change.
    println!("cargo:rerun-if-changed=templates");

    // Dev marker so the dashboard can tell which build is actually running.
    let build_id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=CONFOPS_BUILD_ID={}", build_id);
}
