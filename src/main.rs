mod app;
mod playback;

use app::PigmentStudioApp;
use bevy::app::AppExit;

fn main() -> AppExit {
    PigmentStudioApp::new("Pigment Studio").with_cli_args().run()
}
