//! Rebuild remix-storage whenever a migration is added or edited, since the
//! migrations are embedded with `sqlx::migrate!`.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
