mod app;
mod cpu;
mod error;
mod helpers;
mod local_logger;
mod mem;
mod pprof;
mod prelude;
mod profiler;
mod results;

fn main() {
    let res = crate::app::run();
    if let Err(err) = res {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
