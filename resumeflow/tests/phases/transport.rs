//! Frames through the wire codec: what a remote client rebuilds equals the engine state.

use resumeflow::{encode_frame, FrameDecoder, Phase, PhaseRunner};

use crate::common::{accumulate, collect, resume, seed, services, Script};

#[tokio::test]
async fn decoded_stream_rebuilds_engine_state() {
    let runner = PhaseRunner::new().unwrap();
    let script = Script {
        sufficient: true,
        ..Script::default()
    };
    let start = seed("Senior Backend Engineer, Go, Kubernetes", resume());

    let frames = collect(&runner, Phase::Research, start.clone(), services(script.clone())).await;
    let body: Vec<u8> = frames
        .iter()
        .map(encode_frame)
        .collect::<String>()
        .into_bytes();

    let mut decoder = FrameDecoder::new();
    let mut decoded = Vec::new();
    for chunk in body.chunks(7) {
        decoded.extend(decoder.push(chunk));
    }
    assert!(decoder.finish().is_ok());
    assert_eq!(decoded, frames);

    let rebuilt = accumulate(start.clone(), &decoded).into_value();
    let engine = runner
        .invoke(Phase::Research, start, services(script))
        .await
        .unwrap()
        .into_value();
    assert_eq!(rebuilt, engine);
}
