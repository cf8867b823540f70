#![no_main]

use libfuzzer_sys::fuzz_target;

use lamport_time::LogicalClock;
use lamport_wire::Message;

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = Message::parse(data) {
        // Anything the parser accepts must round-trip and advance a clock
        let reparsed = Message::parse(&message.encode()).expect("encoded message must parse");
        assert_eq!(reparsed, message);

        let clock = LogicalClock::new();
        let before = clock.now();
        let after = clock.observe(message.time);
        assert!(after > before);
        assert!(after > message.time);
        assert!(clock.tick() > after);
    }
});
