//! tsnmp-get: fetch SNMP values.

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use typed_snmp::cli::args::{CommonArgs, OutputArgs};
use typed_snmp::cli::hints::parse_oid;
use typed_snmp::cli::output::{
    OperationType, OutputContext, RequestInfo, write_error, write_verbose_request,
    write_verbose_response,
};
use typed_snmp::{Oid, SessionConfig};

/// Fetch one or more SNMP values with GET (or GETNEXT).
#[derive(Debug, Parser)]
#[command(name = "tsnmp-get", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Fetch the successor of each OID instead.
    #[arg(long)]
    next: bool,

    /// OIDs to fetch (dotted notation or well-known names).
    #[arg(required = true, value_name = "OID")]
    oids: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.output.init_tracing();

    let timeout = match args.common.timeout_duration() {
        Ok(timeout) => timeout,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let oids: Vec<Oid> = match args.oids.iter().map(|s| parse_oid(s)).collect() {
        Ok(oids) => oids,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let session = match args
        .common
        .connect(timeout, SessionConfig::default().max_repetitions)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if args.output.verbose {
        write_verbose_request(&RequestInfo {
            target: session.peer_addr(),
            version: session.version(),
            community: args.common.community.clone(),
            operation: if args.next {
                OperationType::GetNext
            } else {
                OperationType::Get
            },
            oids: oids.clone(),
        });
    }

    let start = Instant::now();
    let result = if args.next {
        session.get_next(&oids).await
    } else {
        session.get(&oids).await
    };
    let elapsed = start.elapsed();

    let varbinds = match result {
        Ok(varbinds) => varbinds,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if args.output.verbose {
        write_verbose_response(&varbinds, elapsed, !args.output.no_hints);
    }

    let output_ctx = OutputContext {
        format: args.output.format,
        show_hints: !args.output.no_hints,
        show_timing: args.output.timing,
    };
    let timing = args.output.timing.then_some(elapsed);

    if let Err(e) =
        output_ctx.write_results(session.peer_addr(), session.version(), &varbinds, timing)
    {
        eprintln!("Error writing output: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
