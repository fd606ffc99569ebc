use crate::state::FrameBuffer;

/// Receives the frame buffer after every clear and every draw.
///
/// Adapters translate the 64x32 grid into whatever surface they present; the
/// interpreter makes no assumptions about colour or scale.
pub trait FrameSink {
    fn flush(&mut self, frame: &FrameBuffer);
}

impl<F> FrameSink for F
where
    F: FnMut(&FrameBuffer),
{
    fn flush(&mut self, frame: &FrameBuffer) {
        self(frame)
    }
}

/// Gates the host's tone, told every tick whether the sound timer is running
pub trait ToneGate {
    fn set_tone(&mut self, on: bool);
}

impl<F> ToneGate for F
where
    F: FnMut(bool),
{
    fn set_tone(&mut self, on: bool) {
        self(on)
    }
}
