use talaria::animations::{Easing, Frame, Segment};
use talaria::devices::Led;
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;
use talaria::pause;

#[talaria::runtime]
async fn main() {
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        let mut led = Led::new(&board, 11, false)?;

        // Segments stack in a queue and play in order.
        let rise = Segment::new(1000)
            .with_frame(Frame::absolute(0.0))
            .with_frame(Frame::percent(100.0))
            .set_easing(Easing::SineIn);
        let fall = Segment::new(1000)
            .with_frame(Frame::hold())
            .with_frame(Frame::percent(0.0))
            .set_easing(Easing::SineOut)
            .set_on_complete(|status| async move {
                println!("Queue drained: {:?}", status);
            });

        led.animate(rise)?;
        led.animate(fall)?;
        pause!(2500);

        Ok(())
    });
}
