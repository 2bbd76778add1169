// Domain model: positions, players, teams and seasons.

pub mod player;
pub mod position;
pub mod season;
pub mod team;

pub use player::{Hitter, Pitcher, Player, PlayerInfo, PlayerMut};
pub use position::{Position, Role};
pub use season::{Season, SeasonContext};
pub use team::Team;
