use talaria::devices::Relay;
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;
use talaria::pause;

#[talaria::runtime]
async fn main() {
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        // Register a normally-open relay on pin 4.
        let mut relay = Relay::new(&board, 4)?;

        // Energize then release the coil a few times.
        for _ in 0..3 {
            relay.close()?;
            println!("{}", relay);
            pause!(1000);

            relay.open()?;
            println!("{}", relay);
            pause!(1000);
        }

        Ok(())
    });
}
