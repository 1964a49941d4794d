//! Fixed-size population and the DE selection pass.

use rand::seq::index;
use rand::Rng;
use u_metaheur::ga::Individual;

use super::chromosome::SignalPlan;
use super::config::{DeConfig, Objective, Replacement};
use super::operators::{create_population, mutate_length, recombine, repair_length};

/// A fixed-size, ordered set of signal plans for one zone.
///
/// Slots are overwritten in place; plans are never added or removed after
/// creation.
#[derive(Debug, Clone)]
pub struct Population {
    plans: Vec<SignalPlan>,
}

impl Population {
    /// Wraps existing plans.
    pub fn new(plans: Vec<SignalPlan>) -> Self {
        Self { plans }
    }

    /// Creates a random population sized and bounded by `config`.
    pub fn random<R: Rng>(pool_size: usize, config: &DeConfig, rng: &mut R) -> Self {
        Self::new(create_population(
            pool_size,
            config.population_size,
            config.min_signals,
            config.max_signals,
            rng,
        ))
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Returns `true` if the population has no slot.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Plans in slot order.
    pub fn plans(&self) -> &[SignalPlan] {
        &self.plans
    }

    /// Fitness of slot `i`, evaluating it on first use.
    pub fn fitness_of<F>(&mut self, i: usize, score: &F) -> f64
    where
        F: Fn(&[usize]) -> f64,
    {
        let plan = &mut self.plans[i];
        if !plan.is_evaluated() {
            let fitness = score(plan.signals());
            plan.set_fitness(fitness);
        }
        plan.fitness()
    }

    /// Evaluates every slot and returns the best one.
    ///
    /// Ties go to the lowest slot. Returns `None` for an empty population.
    pub fn best<F>(&mut self, objective: Objective, score: &F) -> Option<(usize, f64)>
    where
        F: Fn(&[usize]) -> f64,
    {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.plans.len() {
            let fitness = self.fitness_of(i, score);
            let better = best.map_or(true, |(_, incumbent)| objective.improves(fitness, incumbent));
            if better {
                best = Some((i, fitness));
            }
        }
        best
    }

    /// Takes the plan out of slot `i`, consuming the population.
    pub fn into_plan(mut self, i: usize) -> SignalPlan {
        self.plans.swap_remove(i)
    }

    /// Runs one selection pass over every slot.
    ///
    /// Slot `i` competes against a trial built from three other slots
    /// (recombine, repair, grow/shrink) and is replaced when the trial is
    /// strictly better. Under [`Replacement::SteadyState`] parents are read
    /// from the population as it is being updated; under
    /// [`Replacement::Generational`] from a snapshot of the generation's
    /// start. Returns the number of replaced slots.
    ///
    /// A population of fewer than four plans has no three distinct other
    /// parents for any slot and is left unchanged.
    pub fn select_generation<F, R>(
        &mut self,
        pool_size: usize,
        config: &DeConfig,
        score: &F,
        rng: &mut R,
    ) -> usize
    where
        F: Fn(&[usize]) -> f64,
        R: Rng,
    {
        if self.plans.len() < 4 {
            return 0;
        }
        let snapshot = match config.replacement {
            Replacement::SteadyState => None,
            Replacement::Generational => Some(self.plans.clone()),
        };
        let mut replaced = 0;

        for i in 0..self.plans.len() {
            let [p, q, r] = pick_others(self.plans.len(), i, rng);
            let parents = snapshot.as_deref().unwrap_or(self.plans.as_slice());
            let mut child = recombine(
                parents[p].signals(),
                parents[q].signals(),
                parents[r].signals(),
                pool_size,
                config.differential_weight,
                rng,
            );
            repair_length(&mut child, pool_size, config.min_signals, rng);
            mutate_length(
                &mut child,
                pool_size,
                config.min_signals,
                config.max_signals,
                config.mutation_rate,
                rng,
            );

            let trial = score(&child);
            let current = self.fitness_of(i, score);
            if config.objective.improves(trial, current) {
                self.plans[i] = SignalPlan::with_fitness(child, trial);
                replaced += 1;
            }
        }
        replaced
    }
}

/// Draws three distinct slots out of `0..len`, none equal to `exclude`.
fn pick_others<R: Rng>(len: usize, exclude: usize, rng: &mut R) -> [usize; 3] {
    let picks = index::sample(rng, len - 1, 3);
    let skip = |j: usize| if j >= exclude { j + 1 } else { j };
    [skip(picks.index(0)), skip(picks.index(1)), skip(picks.index(2))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn score_sum(signals: &[usize]) -> f64 {
        signals.iter().sum::<usize>() as f64
    }

    #[test]
    fn test_pick_others_excludes_slot() {
        let mut rng = u_numflow::random::create_rng(42);
        for exclude in 0..4 {
            for _ in 0..50 {
                let picks = pick_others(4, exclude, &mut rng);
                let set: HashSet<usize> = picks.iter().copied().collect();
                assert_eq!(set.len(), 3);
                assert!(!set.contains(&exclude));
                assert!(picks.iter().all(|&p| p < 4));
            }
        }
    }

    #[test]
    fn test_best_first_wins_ties() {
        let mut pop = Population::new(vec![
            SignalPlan::new(vec![3, 4]),
            SignalPlan::new(vec![1, 2]),
            SignalPlan::new(vec![2, 1]),
        ]);
        assert_eq!(pop.best(Objective::Minimize, &score_sum), Some((1, 3.0)));
        assert_eq!(pop.best(Objective::Maximize, &score_sum), Some((0, 7.0)));
        assert!(pop.plans().iter().all(|p| p.is_evaluated()));
    }

    #[test]
    fn test_best_empty() {
        let mut pop = Population::new(vec![]);
        assert!(pop.is_empty());
        assert_eq!(pop.best(Objective::Minimize, &score_sum), None);
    }

    #[test]
    fn test_fitness_is_cached() {
        use std::cell::Cell;
        let calls = Cell::new(0);
        let score = |s: &[usize]| {
            calls.set(calls.get() + 1);
            s.len() as f64
        };
        let mut pop = Population::new(vec![SignalPlan::new(vec![1, 2, 3])]);
        assert_eq!(pop.fitness_of(0, &score), 3.0);
        assert_eq!(pop.fitness_of(0, &score), 3.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_selection_never_worsens_a_slot() {
        let mut rng = u_numflow::random::create_rng(7);
        for replacement in [Replacement::SteadyState, Replacement::Generational] {
            let config = DeConfig::default()
                .with_population_size(12)
                .with_replacement(replacement);
            let mut pop = Population::random(30, &config, &mut rng);
            let before: Vec<f64> = (0..pop.len()).map(|i| pop.fitness_of(i, &score_sum)).collect();
            for _ in 0..10 {
                pop.select_generation(30, &config, &score_sum, &mut rng);
            }
            assert_eq!(pop.len(), 12);
            for (i, &old) in before.iter().enumerate() {
                let plan = &pop.plans()[i];
                assert!(plan.fitness() <= old);
                assert_eq!(plan.fitness(), score_sum(plan.signals()));
                assert!((5..=10).contains(&plan.len()));
                assert!(plan.has_unique_signals());
            }
        }
    }

    /// Slot 0 holds a poor plan, slots 1..=3 one good plan. With weight 1
    /// and fixed-length plans, slot 0's trial is the good plan; slot 1's
    /// trial shows whether it saw that replacement.
    fn trials_of_first_two_slots(replacement: Replacement) -> Vec<Vec<usize>> {
        use std::cell::RefCell;
        let good = vec![0, 1, 2, 3, 4];
        let poor = vec![10, 11, 12, 13, 14];
        let mut pop = Population::new(vec![
            SignalPlan::with_fitness(poor.clone(), score_sum(&poor)),
            SignalPlan::with_fitness(good.clone(), score_sum(&good)),
            SignalPlan::with_fitness(good.clone(), score_sum(&good)),
            SignalPlan::with_fitness(good.clone(), score_sum(&good)),
        ]);
        let config = DeConfig::default()
            .with_population_size(4)
            .with_signal_bounds(5, 5)
            .with_differential_weight(1.0)
            .with_replacement(replacement);
        let trials = RefCell::new(Vec::new());
        let score = |s: &[usize]| {
            trials.borrow_mut().push(s.to_vec());
            score_sum(s)
        };
        let mut rng = u_numflow::random::create_rng(17);
        pop.select_generation(30, &config, &score, &mut rng);
        assert_eq!(pop.plans()[0].signals(), &good[..]);
        let trials = trials.into_inner();
        trials[..2].to_vec()
    }

    #[test]
    fn test_steady_state_parents_see_earlier_winner() {
        let trials = trials_of_first_two_slots(Replacement::SteadyState);
        assert_eq!(trials[0], vec![0, 1, 2, 3, 4]);
        // all three parents of slot 1 are now the good plan
        assert_eq!(trials[1], vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_generational_parents_read_snapshot() {
        let trials = trials_of_first_two_slots(Replacement::Generational);
        assert_eq!(trials[0], vec![0, 1, 2, 3, 4]);
        // the poor plan is still a parent of slot 1: the trial is either the
        // poor plan itself or good + good - poor wrapped into the pool
        assert_ne!(trials[1], vec![0, 1, 2, 3, 4]);
        assert!(
            trials[1] == vec![10, 11, 12, 13, 14] || trials[1] == vec![20, 21, 22, 23, 24]
        );
    }

    #[test]
    fn test_small_population_left_unchanged() {
        let mut rng = u_numflow::random::create_rng(1);
        let config = DeConfig::default().with_population_size(3);
        let mut pop = Population::random(20, &config, &mut rng);
        let before = pop.plans().to_vec();
        assert_eq!(pop.select_generation(20, &config, &score_sum, &mut rng), 0);
        assert_eq!(pop.plans(), &before[..]);
    }

    #[test]
    fn test_selection_improves_population() {
        let mut rng = u_numflow::random::create_rng(3);
        let config = DeConfig::default().with_population_size(20);
        let mut pop = Population::random(50, &config, &mut rng);
        let (_, start) = pop.best(Objective::Minimize, &score_sum).expect("non-empty");
        let mut replaced = 0;
        for _ in 0..50 {
            replaced += pop.select_generation(50, &config, &score_sum, &mut rng);
        }
        let (_, end) = pop.best(Objective::Minimize, &score_sum).expect("non-empty");
        assert!(replaced > 0);
        assert!(end <= start);
    }

    #[test]
    fn test_into_plan() {
        let pop = Population::new(vec![SignalPlan::new(vec![1]), SignalPlan::new(vec![2])]);
        assert_eq!(pop.into_plan(0).signals(), &[1]);
    }
}
