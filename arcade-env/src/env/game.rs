//! Game logic and rendering of Pong.
use crate::ArcadeAct;
use image::{Rgb, RgbImage};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Width of the screen.
pub const WIDTH: u32 = 160;

/// Height of the screen.
pub const HEIGHT: u32 = 210;

const TOP: i32 = 34;
const BOTTOM: i32 = 194;
const PADDLE_W: i32 = 4;
const PADDLE_H: i32 = 16;
const AGENT_X: i32 = 140;
const OPPONENT_X: i32 = 16;
const OPPONENT_SPEED: i32 = 2;
const BALL_W: i32 = 2;
const BALL_H: i32 = 4;
const BALL_VX: i32 = 2;

const BACKGROUND: Rgb<u8> = Rgb([144, 72, 17]);
const WALL: Rgb<u8> = Rgb([236, 236, 236]);
const AGENT: Rgb<u8> = Rgb([92, 186, 92]);
const OPPONENT: Rgb<u8> = Rgb([213, 130, 74]);
const BALL: Rgb<u8> = Rgb([236, 236, 236]);

/// Points of both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    /// Points of the agent.
    pub agent: u32,

    /// Points of the built-in opponent.
    pub opponent: u32,
}

impl Score {
    /// Points of the leading side.
    pub fn max(&self) -> u32 {
        self.agent.max(self.opponent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Ball {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) vx: i32,
    pub(crate) vy: i32,
}

/// State of a game.
///
/// Positions are top-left corners in screen pixels.
pub(crate) struct Game {
    rng: StdRng,
    pub(crate) ball: Ball,
    pub(crate) agent_y: i32,
    pub(crate) opponent_y: i32,
    pub(crate) score: Score,
}

impl Game {
    pub(crate) fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: StdRng::seed_from_u64(seed),
            ball: Ball {
                x: 0,
                y: 0,
                vx: 0,
                vy: 0,
            },
            agent_y: 0,
            opponent_y: 0,
            score: Score::default(),
        };
        game.reset();
        game
    }

    /// Replaces the random number generator used for serves.
    pub(crate) fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Starts a new game.
    pub(crate) fn reset(&mut self) {
        let center = (TOP + BOTTOM - PADDLE_H) / 2;
        self.agent_y = center;
        self.opponent_y = center;
        self.score = Score::default();
        self.serve();
    }

    fn serve(&mut self) {
        let vx = match self.rng.gen::<bool>() {
            true => BALL_VX,
            false => -BALL_VX,
        };
        let vy = *[-2, -1, 1, 2].choose(&mut self.rng).unwrap_or(&1);
        self.ball = Ball {
            x: (WIDTH as i32 - BALL_W) / 2,
            y: (TOP + BOTTOM - BALL_H) / 2,
            vx,
            vy,
        };
    }

    /// Advances a frame and returns the reward of the agent.
    pub(crate) fn step(&mut self, act: ArcadeAct) -> f32 {
        self.agent_y = (self.agent_y + act.dy()).clamp(TOP, BOTTOM - PADDLE_H);

        // The opponent follows the ball with a limited speed.
        let target = self.ball.y + BALL_H / 2 - PADDLE_H / 2;
        let dy = (target - self.opponent_y).clamp(-OPPONENT_SPEED, OPPONENT_SPEED);
        self.opponent_y = (self.opponent_y + dy).clamp(TOP, BOTTOM - PADDLE_H);

        let ball = &mut self.ball;
        ball.x += ball.vx;
        ball.y += ball.vy;

        if ball.y < TOP {
            ball.y = TOP;
            ball.vy = -ball.vy;
        } else if ball.y + BALL_H > BOTTOM {
            ball.y = BOTTOM - BALL_H;
            ball.vy = -ball.vy;
        }

        if ball.vx > 0 && hits(ball, AGENT_X, self.agent_y) {
            ball.x = AGENT_X - BALL_W;
            ball.vx = -ball.vx;
            ball.vy = deflection(ball, self.agent_y);
        } else if ball.vx < 0 && hits(ball, OPPONENT_X, self.opponent_y) {
            ball.x = OPPONENT_X + PADDLE_W;
            ball.vx = -ball.vx;
            ball.vy = deflection(ball, self.opponent_y);
        }

        if ball.x + BALL_W < 0 {
            self.score.agent += 1;
            self.serve();
            1.0
        } else if ball.x > WIDTH as i32 {
            self.score.opponent += 1;
            self.serve();
            -1.0
        } else {
            0.0
        }
    }

    /// Renders the screen.
    pub(crate) fn render(&self) -> RgbImage {
        let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
        fill(&mut img, 0, TOP - 10, WIDTH as i32, 10, WALL);
        fill(&mut img, 0, BOTTOM, WIDTH as i32, 16, WALL);
        fill(&mut img, OPPONENT_X, self.opponent_y, PADDLE_W, PADDLE_H, OPPONENT);
        fill(&mut img, AGENT_X, self.agent_y, PADDLE_W, PADDLE_H, AGENT);
        fill(&mut img, self.ball.x, self.ball.y, BALL_W, BALL_H, BALL);
        img
    }
}

fn hits(ball: &Ball, paddle_x: i32, paddle_y: i32) -> bool {
    ball.x + BALL_W >= paddle_x
        && ball.x <= paddle_x + PADDLE_W
        && ball.y + BALL_H >= paddle_y
        && ball.y <= paddle_y + PADDLE_H
}

/// Vertical velocity after a hit, steeper near the ends of the paddle.
fn deflection(ball: &Ball, paddle_y: i32) -> i32 {
    let offset = (ball.y + BALL_H / 2) - (paddle_y + PADDLE_H / 2);
    match (offset / 3).clamp(-3, 3) {
        0 if offset < 0 => -1,
        0 => 1,
        v => v,
    }
}

/// Fills a rectangle, clipped to the image.
fn fill(img: &mut RgbImage, x: i32, y: i32, w: i32, h: i32, color: Rgb<u8>) {
    let (x0, x1) = (x.max(0) as u32, ((x + w).max(0) as u32).min(img.width()));
    let (y0, y1) = (y.max(0) as u32, ((y + h).max(0) as u32).min(img.height()));
    for yy in y0..y1 {
        for xx in x0..x1 {
            img.put_pixel(xx, yy, color);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_serve_is_seeded() {
        let serves = |seed| {
            let mut game = Game::new(seed);
            (0..10)
                .map(|_| {
                    game.serve();
                    (game.ball.vx, game.ball.vy)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(serves(3), serves(3));
        assert_ne!(serves(3), serves(4));
    }

    #[test]
    fn test_agent_misses() {
        let mut game = Game::new(0);
        game.agent_y = TOP;
        game.ball = Ball {
            x: 120,
            y: BOTTOM - 20,
            vx: BALL_VX,
            vy: 0,
        };

        let rewards = (0..30).map(|_| game.step(ArcadeAct::Noop)).collect::<Vec<_>>();
        assert_eq!(rewards.iter().filter(|&&r| r == -1.0).count(), 1);
        assert!(rewards.iter().all(|&r| r <= 0.0));
        assert_eq!(game.score, Score { agent: 0, opponent: 1 });
    }

    #[test]
    fn test_opponent_misses() {
        let mut game = Game::new(0);
        game.opponent_y = TOP;
        game.ball = Ball {
            x: 30,
            y: BOTTOM - 10,
            vx: -BALL_VX,
            vy: 0,
        };

        // the opponent cannot reach the ball in time
        let total: f32 = (0..30).map(|_| game.step(ArcadeAct::Noop)).sum();
        assert_eq!(total, 1.0);
        assert_eq!(game.score, Score { agent: 1, opponent: 0 });
    }

    #[test]
    fn test_agent_returns_ball() {
        let mut game = Game::new(0);
        game.ball = Ball {
            x: AGENT_X - 10,
            y: game.agent_y + 4,
            vx: BALL_VX,
            vy: 0,
        };
        for _ in 0..10 {
            assert_eq!(game.step(ArcadeAct::Noop), 0.0);
        }
        assert!(game.ball.vx < 0);
        assert!(game.ball.vy != 0);
    }

    #[test]
    fn test_paddle_stays_on_screen() {
        let mut game = Game::new(0);
        for _ in 0..100 {
            game.step(ArcadeAct::Up);
        }
        assert_eq!(game.agent_y, TOP);
        for _ in 0..100 {
            game.step(ArcadeAct::Down);
        }
        assert_eq!(game.agent_y, BOTTOM - PADDLE_H);
    }

    #[test]
    fn test_render() {
        let game = Game::new(0);
        let img = game.render();
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
        assert_eq!(
            *img.get_pixel(AGENT_X as u32, game.agent_y as u32),
            AGENT
        );
        assert_eq!(*img.get_pixel(game.ball.x as u32, game.ball.y as u32), BALL);
    }
}
