// Variable-size frames relayed between two threads through a var FIFO.
//
// cargo run --example frame_relay -- <num_messages>
use dmxp_fifo::FIFO::FifoBuilder;
use dmxp_fifo::FifoError;
use sha2::{Digest, Sha256};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn main() -> Result<(), FifoError> {
    let args: Vec<String> = env::args().collect();
    let num_messages: usize = args
        .get(1)
        .map(|s| s.parse().expect("Invalid number of messages"))
        .unwrap_or(10_000);

    let (producer, consumer) = FifoBuilder::new()
        .with_region_size(16 * 1024)
        .with_element_size(512)
        .build_var_channel()?;

    let running = Arc::new(AtomicBool::new(true));
    let running_for_handler = Arc::clone(&running);

    // Handle Ctrl+C to stop early
    ctrlc::set_handler(move || {
        running_for_handler.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!("Relay: {} frames, max {} bytes each", num_messages, producer.max_message_size());

    let start = std::time::Instant::now();
    let sender = thread::spawn(move || -> Result<u64, FifoError> {
        for i in 0..num_messages {
            if !running.load(Ordering::SeqCst) {
                println!("Producer: interrupted after {} frames", i);
                break;
            }
            // Format: "<digest hex>:<filler>", length varies per frame
            let digest = Sha256::digest(format!("message_{}", i).as_bytes());
            let mut frame = format!("{:x}:", digest).into_bytes();
            frame.resize(frame.len() + i % 400, b'.');
            producer.send_blocking(&frame)?;
        }
        Ok(producer.sent())
    });

    let mut received = 0usize;
    let mut bad = 0usize;
    loop {
        match consumer.receive_blocking() {
            Ok(frame) => {
                let expected = Sha256::digest(format!("message_{}", received).as_bytes());
                if !frame.starts_with(format!("{:x}:", expected).as_bytes()) {
                    bad += 1;
                }
                received += 1;
                if received % 1000 == 0 {
                    println!("Consumer: {} frames", received);
                }
            }
            Err(FifoError::Disconnected) => break,
            Err(e) => {
                eprintln!("Consumer error: {}", e);
                break;
            }
        }
    }

    let sent = sender.join().expect("producer thread panicked")?;
    let elapsed = start.elapsed();
    println!("Relay: sent {}, received {}, mismatched {}", sent, received, bad);
    println!(
        "Relay: {:.2} frames/sec",
        received as f64 / elapsed.as_secs_f64()
    );

    Ok(())
}
