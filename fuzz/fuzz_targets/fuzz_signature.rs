#![no_main]

use std::sync::mpsc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

use archgraph_signature::{parse_class_signature, parse_field_signature, parse_method_signature};
use libfuzzer_sys::fuzz_target;

mod utils;

const TIMEOUT: Duration = Duration::from_secs(1);

struct Runner {
    input_tx: mpsc::SyncSender<String>,
    output_rx: Mutex<mpsc::Receiver<()>>,
}

/// Parses `text` with every entry point. Whatever parses must render back to the same bytes.
fn check(text: &str) {
    if let Ok(sig) = parse_class_signature(text) {
        assert_eq!(sig.to_string(), text);
    }
    if let Ok(sig) = parse_method_signature(text) {
        assert_eq!(sig.to_string(), text);
    }
    if let Ok(sig) = parse_field_signature(text) {
        assert_eq!(sig.to_string(), text);
    }
}

fn runner() -> &'static Runner {
    static RUNNER: OnceLock<Runner> = OnceLock::new();
    RUNNER.get_or_init(|| {
        let (input_tx, input_rx) = mpsc::sync_channel::<String>(0);
        let (output_tx, output_rx) = mpsc::sync_channel::<()>(0);

        std::thread::Builder::new()
            .name("fuzz_signature".to_string())
            .spawn(move || {
                for input in input_rx {
                    check(&input);
                    let _ = output_tx.send(());
                }
            })
            .expect("failed to spawn fuzz_signature worker");

        Runner {
            input_tx,
            output_rx: Mutex::new(output_rx),
        }
    })
}

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    let runner = runner();
    runner
        .input_tx
        .send(text.to_string())
        .expect("fuzz_signature worker thread exited");

    match runner
        .output_rx
        .lock()
        .expect("fuzz_signature worker receiver poisoned")
        .recv_timeout(TIMEOUT)
    {
        Ok(()) => {}
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("fuzz_signature fuzz target timed out"),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            panic!("fuzz_signature worker thread panicked")
        }
    }
});
