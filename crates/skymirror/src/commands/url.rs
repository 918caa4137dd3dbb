//! `skymirror url` -- translate an AT-URI into its web URL.

use skymirror_core::post_web_url;

use crate::cli::UrlArgs;

pub fn handle(args: &UrlArgs) {
    println!("{}", post_web_url(&args.uri, &args.handle));
}
