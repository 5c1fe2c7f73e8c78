use talaria::animations::{Frame, Segment};
use talaria::devices::Led;
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;
use talaria::pause;

#[talaria::runtime]
async fn main() {
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        let mut led = Led::new(&board, 11, false)?;

        // A metronomic segment plays forward then backward, indefinitely.
        let swing = Segment::new(1000)
            .with_frame(Frame::absolute(0.0))
            .with_frame(Frame::percent(100.0))
            .set_metronomic(true)
            .set_on_loop(|passes: usize| async move {
                println!("Pass {} done", passes);
            });

        led.animate(swing)?;
        pause!(5000);

        led.stop();
        led.off()?;

        Ok(())
    });
}
