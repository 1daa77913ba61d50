//! Transient hit-burst particles
//!
//! Visual only: particles never affect score or collision and carry no
//! entity identity.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::PARTICLE_LIFE_DECAY;

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in [0, 1]; decays linearly each tick
    pub life: f32,
    /// CSS color the presenter draws with
    pub color: &'static str,
    pub size: f32,
}

/// Shape of a hit-effect burst
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub color: &'static str,
    /// Width of the random velocity scatter, centred on zero
    pub spread: f32,
    /// Upward kick subtracted from the vertical velocity
    pub kick: f32,
    pub size_min: f32,
    pub size_max: f32,
}

/// Scatter `burst.count` particles around `pos`
pub fn spawn_burst(particles: &mut Vec<Particle>, rng: &mut Pcg32, pos: Vec2, burst: Burst) {
    for _ in 0..burst.count {
        let vx = (rng.random::<f32>() - 0.5) * burst.spread;
        let vy = (rng.random::<f32>() - 0.5) * burst.spread - burst.kick;
        let size = if burst.size_max > burst.size_min {
            rng.random_range(burst.size_min..burst.size_max)
        } else {
            burst.size_min
        };
        particles.push(Particle {
            pos,
            vel: Vec2::new(vx, vy),
            life: 1.0,
            color: burst.color,
            size,
        });
    }
}

/// Integrate positions, apply gravity, decay life, drop dead particles
pub fn step_particles(particles: &mut Vec<Particle>, gravity: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += gravity;
        p.life -= PARTICLE_LIFE_DECAY;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const TEST_BURST: Burst = Burst {
        count: 10,
        color: "#FFD700",
        spread: 8.0,
        kick: 3.0,
        size_min: 2.0,
        size_max: 6.0,
    };

    #[test]
    fn test_burst_spawns_count() {
        let mut particles = Vec::new();
        let mut rng = Pcg32::seed_from_u64(1);
        spawn_burst(&mut particles, &mut rng, Vec2::new(100.0, 500.0), TEST_BURST);
        assert_eq!(particles.len(), 10);
        assert!(particles.iter().all(|p| p.life == 1.0));
        assert!(particles.iter().all(|p| p.size >= 2.0 && p.size < 6.0));
    }

    #[test]
    fn test_particles_expire() {
        let mut particles = Vec::new();
        let mut rng = Pcg32::seed_from_u64(1);
        spawn_burst(&mut particles, &mut rng, Vec2::ZERO, TEST_BURST);
        // Life 1.0 at decay 0.02 per tick is gone within 50 ticks
        for _ in 0..50 {
            step_particles(&mut particles, 0.3);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut particles = vec![Particle {
            pos: Vec2::new(0.0, 0.0),
            vel: Vec2::new(0.0, -3.0),
            life: 1.0,
            color: "#FFF",
            size: 4.0,
        }];
        step_particles(&mut particles, 0.3);
        assert_eq!(particles[0].vel.y, -2.7);
        assert_eq!(particles[0].pos.y, -3.0);
    }
}
