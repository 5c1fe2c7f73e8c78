use talaria::devices::Servo;
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;
use talaria::pause;

#[talaria::runtime]
async fn main() {
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        // Register a Servo on pin 12, starting at 90 degrees.
        let mut servo = Servo::new(&board, 12, 90)?;

        // Swing across the whole range, one traversal per 500ms (for 5 seconds).
        servo.sweep(500)?;
        pause!(5000);

        servo.stop();
        servo.center()?;

        Ok(())
    });
}
