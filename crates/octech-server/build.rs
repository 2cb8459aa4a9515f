use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=../../web");

    let web = Path::new("../../web");
    for page in ["index.html", "login.html", "dashboard.html"] {
        let path = web.join(page);
        if !path.exists() {
            fs::create_dir_all(web).expect("Failed to create web/");
            fs::write(
                &path,
                format!("<html><body><h1>Placeholder</h1><p>{page} is missing from web/</p></body></html>"),
            )
            .expect("Failed to write placeholder page");
        }
    }
}
