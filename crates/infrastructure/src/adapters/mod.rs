//! Adapters implementing the application ports.

mod reqwest_exchanger;
mod signout_channel;
mod system_browser;
mod system_clock;

pub use reqwest_exchanger::{EXCHANGE_PATH, ReqwestTokenExchanger};
pub use signout_channel::SignoutChannel;
pub use system_browser::{Launcher, SystemBrowser};
pub use system_clock::SystemClock;
