//! tsnmp-walk: walk SNMP subtrees.

use clap::Parser;
use futures_core::Stream;
use std::future::poll_fn;
use std::pin::Pin;
use std::process::ExitCode;
use std::task::Context;
use std::time::Instant;
use typed_snmp::cli::args::{CommonArgs, OutputArgs, WalkArgs};
use typed_snmp::cli::hints::parse_oid;
use typed_snmp::cli::output::{
    OperationType, OutputContext, RequestInfo, write_error, write_verbose_request,
    write_verbose_response,
};
use typed_snmp::{Oid, VarBind, VarBindList, WalkStream};

/// Walk one or more SNMP subtrees with GETBULK (v2c) or GETNEXT.
#[derive(Debug, Parser)]
#[command(name = "tsnmp-walk", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    walk: WalkArgs,

    /// Subtree roots (dotted notation or well-known names).
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

    let roots: Vec<Oid> = match args.oids.iter().map(|s| parse_oid(s)).collect() {
        Ok(roots) => roots,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let session = match args
        .common
        .connect(timeout, args.walk.max_repetitions)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let mut walked = Vec::new();
    let mut failure = None;
    let start = Instant::now();

    for root in roots {
        let mut walk = session.walk_with(root.clone(), args.walk.mode());
        if let Some(limit) = args.walk.limit {
            walk = walk.limit(limit);
        }

        if args.output.verbose {
            let operation = match walk {
                WalkStream::GetNext(_) => OperationType::Walk,
                WalkStream::GetBulk(_) => OperationType::BulkWalk {
                    max_repetitions: args.walk.max_repetitions,
                },
            };
            write_verbose_request(&RequestInfo {
                target: session.peer_addr(),
                version: session.version(),
                community: args.common.community.clone(),
                operation,
                oids: vec![root],
            });
        }

        if let Err(e) = drain_into(walk, &mut walked).await {
            failure = Some(e);
            break;
        }
    }

    let elapsed = start.elapsed();
    let varbinds = VarBindList::new(walked);

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

    match failure {
        Some(e) => {
            write_error(&e);
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

/// Append a walk's bindings, keeping those yielded before any error.
async fn drain_into<S>(mut walk: S, out: &mut Vec<VarBind>) -> typed_snmp::Result<()>
where
    S: Stream<Item = typed_snmp::Result<VarBind>> + Unpin,
{
    while let Some(item) = poll_fn(|cx: &mut Context<'_>| Pin::new(&mut walk).poll_next(cx)).await
    {
        out.push(item?);
    }
    Ok(())
}
