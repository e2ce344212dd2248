use anyhow::Result;
use clap::Parser;
use nestload::AllocationProbe;
use nestload_cli::{Cli, NestloadCli};
use std::{
    alloc::{GlobalAlloc, Layout, System},
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Counts every byte handed out, never subtracting frees.
#[derive(Debug)]
struct CountingAllocator {
    allocated: AtomicU64,
}

#[global_allocator]
static ALLOC: CountingAllocator = CountingAllocator {
    allocated: AtomicU64::new(0),
};

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            self.allocated
                .fetch_add(layout.size() as u64, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new = unsafe { System.realloc(ptr, layout, new_size) };
        if !new.is_null() && new_size > layout.size() {
            self.allocated
                .fetch_add((new_size - layout.size()) as u64, Ordering::Relaxed);
        }
        new
    }
}

impl AllocationProbe for CountingAllocator {
    fn allocated_bytes(&self) -> u64 {
        self.allocated.load(Ordering::Relaxed)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(cli.log_level()).into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    NestloadCli::new()
        .with_probe(&ALLOC)
        .run(cli, &mut std::io::stdout().lock())
        .await
}
