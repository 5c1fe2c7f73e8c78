use talaria::animations::{Easing, Frame, Segment};
use talaria::devices::Servo;
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;
use talaria::pause;

#[talaria::runtime]
async fn main() {
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        // Register a Servo on pin 12, starting at 0 degrees.
        let mut servo = Servo::new(&board, 12, 0)?;

        // Timed move: reach 180 degrees in 2 seconds.
        servo.animate(180, 2000)?;
        pause!(2500);

        // Custom segment: drop back to 0 by mid-course, then settle on the center,
        // slowing down on both ends of the motion.
        let segment = Segment::new(2000)
            .with_frame(Frame::hold())
            .with_frame(Frame::absolute(0.0).at(0.5))
            .with_frame(Frame::absolute(90.0))
            .set_easing(Easing::SineInOut);
        servo.animate_with(segment)?;
        pause!(2500);

        Ok(())
    });
}
