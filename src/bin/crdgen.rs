//! # CRD Generator
//!
//! Prints the `DvlsSecret` CustomResourceDefinition as YAML.
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/dvlssecret.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use dvls_secret_controller::crd::DvlsSecret;
use kube::core::CustomResourceExt;

fn main() {
    let crd = DvlsSecret::crd();

    match serde_yaml::to_string(&crd) {
        Ok(yaml) => {
            println!("# This file is auto-generated by crdgen");
            println!("# DO NOT EDIT THIS FILE MANUALLY");
            println!("---");
            print!("{yaml}");
        }
        Err(e) => {
            eprintln!("Failed to serialize CRD to YAML: {e}");
            std::process::exit(1);
        }
    }
}
