use rdfstream_core::{PROTO_VERSION, PROTO_VERSION_1_0_X};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("rdfstream {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: rdfstream");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("protocol: {PROTO_VERSION_1_0_X}..={PROTO_VERSION}");
    println!(
        "target: {}",
        option_env!("RDFSTREAM_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "features: oxrdf={}, async={}, cli=true",
        cfg!(feature = "oxrdf"),
        cfg!(feature = "async")
    );

    Ok(SUCCESS)
}
